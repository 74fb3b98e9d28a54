/// Data layer: remote sources, loading, table model, and aggregation.
///
/// Architecture:
/// ```text
///   SourceDescriptor (url, raw | zip)
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  GET → status + bytes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  html sniff → unzip → utf-8 / latin-1 / cp1252 → Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  Table → Ranking for the selected view
///   └───────────┘
/// ```

pub mod aggregate;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod source;
