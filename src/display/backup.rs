//! Backup display formatting

use crate::backup::BackupInfo;

/// Format backups as a table, oldest first
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.\n".to_string();
    }

    let name_width = backups
        .iter()
        .map(|b| b.filename.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:19}  {:>10}\n",
        "Filename",
        "Created",
        "Size",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<19}  {:->10}\n",
        "",
        "",
        "",
        name_width = name_width
    ));

    for backup in backups {
        output.push_str(&format!(
            "{:<name_width$}  {}  {:>10}\n",
            backup.filename,
            backup
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
            format_size(backup.size_bytes),
            name_width = name_width
        ));
    }

    output
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
