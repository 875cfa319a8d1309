//! Copy/move engine.
//!
//! Transfers a whole group or a targeted set of bookmarks between two
//! (possibly different) workspace/backend pairs. Copies always mint new ids
//! (the destination is a distinct dataset) and optionally de-duplicate by
//! normalized URL against every bookmark already in the destination. Large
//! copies proceed in chunks with a progress callback so the UI layer can
//! stay responsive and compose cancellation.

use std::collections::HashSet;

use uuid::Uuid;

use crate::adapter::BookmarkStore;
use crate::types::bookmark::{Bookmark, BookmarkGroup};
use crate::types::errors::{StoreError, TransferError};
use crate::types::workspace::now_ms;
use crate::urlnorm::normalize_url;

/// Bookmarks copied per progress tick when the caller does not choose.
pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// What to transfer.
#[derive(Debug, Clone)]
pub enum TransferTarget {
    /// A whole group, copied as a new group appended to the destination.
    Group { group_id: String },
    /// Specific bookmarks, copied into an existing destination group.
    Bookmarks {
        bookmark_ids: Vec<String>,
        into_group_id: String,
    },
}

/// Invoked once per chunk with `(processed_count, skipped_count)`.
pub type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Default)]
pub struct TransferOptions {
    pub dedupe_by_url: bool,
    pub chunk_size: Option<usize>,
    pub on_progress: Option<ProgressFn>,
}

pub struct TransferRequest {
    pub from_workspace_id: String,
    pub to_workspace_id: String,
    pub from_storage_key: String,
    pub to_storage_key: String,
    pub target: TransferTarget,
    pub options: TransferOptions,
}

/// Summary of one copy or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Copies or moves bookmark data between a source and destination store.
pub struct CopyMoveEngine<'a> {
    source: &'a dyn BookmarkStore,
    dest: &'a dyn BookmarkStore,
}

impl<'a> CopyMoveEngine<'a> {
    pub fn new(source: &'a dyn BookmarkStore, dest: &'a dyn BookmarkStore) -> Self {
        Self { source, dest }
    }

    /// Copies the targeted items into the destination. One write to the
    /// destination; the source is untouched.
    pub async fn copy_items(&self, req: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let source_groups = self
            .source
            .read_all_groups(&req.from_workspace_id, &req.from_storage_key)
            .await
            .map_err(store_err)?;
        let mut dest_groups = self
            .dest
            .read_all_groups(&req.to_workspace_id, &req.to_storage_key)
            .await
            .map_err(store_err)?;

        let outcome = apply_copy(&source_groups, &mut dest_groups, req)?;

        self.dest
            .write_all_groups(&req.to_workspace_id, &req.to_storage_key, &dest_groups)
            .await
            .map_err(store_err)?;
        Ok(outcome)
    }

    /// Copy followed by removal of the transferred items from the source.
    /// Exactly one write each to source and destination.
    pub async fn move_items(&self, req: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let mut source_groups = self
            .source
            .read_all_groups(&req.from_workspace_id, &req.from_storage_key)
            .await
            .map_err(store_err)?;
        let mut dest_groups = self
            .dest
            .read_all_groups(&req.to_workspace_id, &req.to_storage_key)
            .await
            .map_err(store_err)?;

        let outcome = apply_copy(&source_groups, &mut dest_groups, req)?;
        remove_from_source(&mut source_groups, &req.target);

        self.dest
            .write_all_groups(&req.to_workspace_id, &req.to_storage_key, &dest_groups)
            .await
            .map_err(store_err)?;
        self.source
            .write_all_groups(&req.from_workspace_id, &req.from_storage_key, &source_groups)
            .await
            .map_err(store_err)?;
        Ok(outcome)
    }
}

/// Performs the copy against in-memory collections. Pure apart from id
/// minting, so both copy and move share it and each issues a single write.
fn apply_copy(
    source_groups: &[BookmarkGroup],
    dest_groups: &mut Vec<BookmarkGroup>,
    req: &TransferRequest,
) -> Result<TransferOutcome, TransferError> {
    let opts = &req.options;
    let mut seen_urls = if opts.dedupe_by_url {
        dest_groups
            .iter()
            .flat_map(|g| g.bookmarks.iter())
            .map(|b| normalize_url(&b.url))
            .collect::<HashSet<String>>()
    } else {
        HashSet::new()
    };

    match &req.target {
        TransferTarget::Group { group_id } => {
            let group = source_groups
                .iter()
                .find(|g| &g.id == group_id)
                .ok_or_else(|| TransferError::SourceGroupNotFound(group_id.clone()))?;

            let mut copied = BookmarkGroup {
                id: Uuid::new_v4().to_string(),
                group_name: group.group_name.clone(),
                bookmarks: Vec::new(),
            };
            let outcome = copy_bookmarks(
                group.bookmarks.iter(),
                &mut copied.bookmarks,
                &mut seen_urls,
                opts,
            );
            dest_groups.push(copied);
            Ok(outcome)
        }
        TransferTarget::Bookmarks {
            bookmark_ids,
            into_group_id,
        } => {
            let dest_index = dest_groups
                .iter()
                .position(|g| &g.id == into_group_id)
                .ok_or_else(|| TransferError::DestinationGroupNotFound(into_group_id.clone()))?;

            let wanted: HashSet<&str> = bookmark_ids.iter().map(String::as_str).collect();
            let matched: Vec<&Bookmark> = source_groups
                .iter()
                .flat_map(|g| g.bookmarks.iter())
                .filter(|b| wanted.contains(b.id.as_str()))
                .collect();

            let mut copied = Vec::new();
            let outcome = copy_bookmarks(matched.into_iter(), &mut copied, &mut seen_urls, opts);
            dest_groups[dest_index].bookmarks.extend(copied);
            Ok(outcome)
        }
    }
}

/// Chunked copy of bookmarks with fresh ids, dedupe, and per-chunk progress.
fn copy_bookmarks<'b>(
    bookmarks: impl Iterator<Item = &'b Bookmark>,
    out: &mut Vec<Bookmark>,
    seen_urls: &mut HashSet<String>,
    opts: &TransferOptions,
) -> TransferOutcome {
    let chunk_size = opts.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1);
    let mut added = 0usize;
    let mut skipped = 0usize;
    let mut in_chunk = 0usize;

    for bookmark in bookmarks {
        if opts.dedupe_by_url && !seen_urls.insert(normalize_url(&bookmark.url)) {
            skipped += 1;
        } else {
            out.push(Bookmark {
                id: Uuid::new_v4().to_string(),
                name: bookmark.name.clone(),
                url: bookmark.url.clone(),
                created_at: now_ms(),
            });
            added += 1;
        }
        in_chunk += 1;
        if in_chunk == chunk_size {
            report_progress(opts, added + skipped, skipped);
            in_chunk = 0;
        }
    }
    if in_chunk > 0 {
        report_progress(opts, added + skipped, skipped);
    }
    TransferOutcome { added, skipped }
}

fn report_progress(opts: &TransferOptions, processed: usize, skipped: usize) {
    if let Some(on_progress) = &opts.on_progress {
        on_progress(processed, skipped);
    }
}

/// Removes the transferred items from the source collection in place.
fn remove_from_source(source_groups: &mut Vec<BookmarkGroup>, target: &TransferTarget) {
    match target {
        TransferTarget::Group { group_id } => {
            source_groups.retain(|g| &g.id != group_id);
        }
        TransferTarget::Bookmarks { bookmark_ids, .. } => {
            let wanted: HashSet<&str> = bookmark_ids.iter().map(String::as_str).collect();
            for group in source_groups.iter_mut() {
                group.bookmarks.retain(|b| !wanted.contains(b.id.as_str()));
            }
        }
    }
}

fn store_err(e: StoreError) -> TransferError {
    TransferError::Store(e.to_string())
}
