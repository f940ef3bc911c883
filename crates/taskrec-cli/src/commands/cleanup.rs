use anyhow::Result;
use chrono::Duration;
use taskrec_core::{DownloadTask, RecordRepository};
use taskrec_infrastructure::RecordStore;

pub async fn prune(
    store: &RecordStore<DownloadTask>,
    age: Duration,
    group: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let task_ids: Vec<String> = store
        .all_records_older_than(age, group)
        .await?
        .iter()
        .map(|record| record.task_id().to_string())
        .collect();

    if dry_run {
        for task_id in &task_ids {
            println!("{}", task_id);
        }
        eprintln!("{} record(s) would be deleted", task_ids.len());
        return Ok(());
    }

    store.delete_records_with_ids(&task_ids).await?;
    tracing::info!(count = task_ids.len(), group, "pruned task records");
    eprintln!("Deleted {} record(s)", task_ids.len());
    Ok(())
}

pub async fn delete(store: &RecordStore<DownloadTask>, task_ids: &[String]) -> Result<()> {
    store.delete_records_with_ids(task_ids).await?;
    tracing::info!(count = task_ids.len(), "deleted task records");
    Ok(())
}

pub async fn clear(store: &RecordStore<DownloadTask>, group: Option<&str>) -> Result<()> {
    store.delete_all_records(group).await?;
    tracing::info!(group, collection = store.collection(), "cleared task records");
    Ok(())
}
