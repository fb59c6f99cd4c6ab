// tests/watch_paths.rs

use std::path::{Path, PathBuf};

use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use notify::EventKind;

use pugwatch::graph::{depth_of, TemplateFilter};
use pugwatch::types::ChangeKind;
use pugwatch::watch::classify;
use pugwatch::watch::path_utils::{rebase_on_root, relative_str};

#[test]
fn filter_matches_templates_at_any_depth() {
    let filter = TemplateFilter::new(".pug").unwrap();

    assert_eq!(filter.extension(), "pug");
    assert!(filter.matches("a.pug"));
    assert!(filter.matches("pages/deep/card.pug"));
    assert!(!filter.matches("a.pug.swp"));
    assert!(!filter.matches("styles/site.css"));
}

#[test]
fn depth_counts_segments_below_root() {
    let root = Path::new("/tpl/raw");
    assert_eq!(depth_of(root, Path::new("/tpl/raw/a.pug")), 1);
    assert_eq!(depth_of(root, Path::new("/tpl/raw/x/y/a.pug")), 3);
}

#[test]
fn classify_keeps_content_changes_only() {
    assert_eq!(
        classify(&EventKind::Create(CreateKind::File)),
        Some(ChangeKind::Added)
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        Some(ChangeKind::Changed)
    );
    assert_eq!(
        classify(&EventKind::Remove(RemoveKind::File)),
        Some(ChangeKind::Removed)
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))),
        None
    );
    assert_eq!(classify(&EventKind::Access(AccessKind::Any)), None);
}

#[test]
fn event_paths_are_rebased_onto_root() {
    let root = Path::new("/tpl/raw");

    assert_eq!(
        relative_str(root, Path::new("/tpl/raw/pages/a.pug")).as_deref(),
        Some("pages/a.pug")
    );
    assert_eq!(
        rebase_on_root(root, Path::new("/tpl/raw/pages/a.pug")),
        Some(PathBuf::from("/tpl/raw/pages/a.pug"))
    );
    assert_eq!(rebase_on_root(root, root), None);
    assert_eq!(rebase_on_root(root, Path::new("/elsewhere/a.pug")), None);
}
