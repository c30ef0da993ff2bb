//! Locate Cypress screenshots and videos for failed tests.
//!
//! Cypress names failure screenshots `<suite> -- <test> (failed).png` under a
//! per-spec folder and records one `<spec>.mp4` per spec file. Missing
//! directories simply yield no media.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::FailedTest;

/// Fill `screenshot` and `video` for each failed test.
pub async fn attach_media(failed_tests: &mut [FailedTest], screenshot_dir: &Path, video_dir: &Path) {
    if failed_tests.is_empty() {
        return;
    }

    let screenshots = list_files(screenshot_dir, "png").await;
    debug!(
        "Found {} screenshot(s) under {}",
        screenshots.len(),
        screenshot_dir.display()
    );

    for test in failed_tests.iter_mut() {
        test.screenshot = find_screenshot(&screenshots, &test.title);
        if let Some(spec) = &test.spec_file {
            test.video = find_video(video_dir, spec).await;
        }
    }
}

/// Screenshot taken when `title` failed.
fn find_screenshot(screenshots: &[PathBuf], title: &str) -> Option<PathBuf> {
    let exact = format!("{} (failed).png", title);
    let nested = format!(" -- {}", exact);
    screenshots
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name == exact || name.ends_with(&nested))
        })
        .cloned()
}

/// `<video_dir>/<spec basename>.mp4`, if it exists.
async fn find_video(video_dir: &Path, spec_file: &str) -> Option<PathBuf> {
    let basename = Path::new(spec_file).file_name()?.to_str()?;
    let candidate = video_dir.join(format!("{}.mp4", basename));
    match tokio::fs::try_exists(&candidate).await {
        Ok(true) => Some(candidate),
        _ => None,
    }
}

/// Every file under `root` with the given extension, sorted.
async fn list_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            match entry.file_type().await {
                Ok(ft) if ft.is_dir() => pending.push(path),
                Ok(ft) if ft.is_file() && path.extension().is_some_and(|e| e == extension) => {
                    found.push(path)
                }
                _ => {}
            }
        }
    }

    found.sort();
    found
}
