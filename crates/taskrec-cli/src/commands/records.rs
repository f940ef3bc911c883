use anyhow::{Context, Result};
use taskrec_core::{DownloadTask, RecordRepository, TaskRecord, TaskStatus};
use taskrec_infrastructure::RecordStore;

pub async fn list(
    store: &RecordStore<DownloadTask>,
    group: Option<&str>,
    status: Option<TaskStatus>,
) -> Result<()> {
    let mut records = store.all_records(group).await?;
    if let Some(status) = status {
        records.retain(|record| record.status == status);
    }
    records.sort_by_key(|record| record.task.creation_time);

    for record in &records {
        println!("{}", format_line(record));
    }
    eprintln!("{} record(s)", records.len());
    Ok(())
}

pub async fn show(store: &RecordStore<DownloadTask>, task_id: &str) -> Result<()> {
    let record = store
        .record_for_id(task_id)
        .await?
        .with_context(|| format!("No record for task '{}'", task_id))?;
    let document = record.to_document()?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn format_line(record: &TaskRecord<DownloadTask>) -> String {
    let mut line = format!(
        "{}\t{}\t{}\t{:>5.1}%\t{}",
        record.task_id(),
        record.group(),
        record.status,
        record.progress * 100.0,
        record.task.creation_time.to_rfc3339(),
    );
    if let Some(exception) = &record.exception {
        line.push('\t');
        line.push_str(&exception.to_string());
    }
    line
}
