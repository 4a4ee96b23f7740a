/// Data layer: core types, parsing, metrics and report writing.
///
/// Architecture:
/// ```text
///  log .xlsx / .csv                    template .xlsx / .csv
///        │                                     │
///        ▼                                     │
///   ┌──────────┐                               │
///   │  loader  │  parse file → NumericColumn   │
///   └──────────┘                               │
///        │                                     │
///        ▼                                     │
///   ┌──────────┐   ┌────────────┐              │
///   │ thermal  │   │ properties │              │
///   └──────────┘   └────────────┘              │
///        │               │                     │
///        ▼               ▼                     ▼
///   ┌──────────────────────────────────────────────┐
///   │  writer   append 16-row column → .xlsx bytes │
///   └──────────────────────────────────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod properties;
pub mod thermal;
pub mod writer;
