use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

/// Notifications are only ever written through the notification repository,
/// which in turn is only driven from the notification service's `emit`.
/// Every write path then shares one chokepoint, which is what keeps the
/// "accepted follow/like/comment yields exactly one notification, or neither
/// happens" invariant reviewable.
#[test]
fn notification_rows_are_written_only_by_the_notification_repo() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");

    let insert_allowed = ["src/db/notification_repo.rs"];
    let repo_call_allowed = ["src/db/mod.rs", "src/services/notifications.rs"];

    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root) {
        let path_str = file.to_string_lossy().replace('\\', "/");

        if file_contains(&file, "INSERT INTO notifications")
            && !insert_allowed.iter().any(|a| path_str.ends_with(a))
        {
            offenders.push(format!("{} (raw INSERT)", path_str));
        }

        if file_contains(&file, "notification_repo::insert")
            && !repo_call_allowed.iter().any(|a| path_str.ends_with(a))
        {
            offenders.push(format!("{} (direct repo insert)", path_str));
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Notification writes must go through services::notifications::emit only. Offenders: {:?}",
            offenders
        );
    }
}
