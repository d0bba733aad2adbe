/*!
 * # lingbridge - language-pair routing for neural machine translation
 *
 * A Rust library that routes text through language-pair specific translation
 * models, pivoting through a hub language when no direct model exists.
 *
 * ## Features
 *
 * - Direct translation for configured language pairs
 * - Two-hop translation through a single hub language
 * - Lazy, load-once caching of model handles per engine family and direction
 * - Batch translation of documents:
 *   - Plain text, line by line
 *   - JSON, every string leaf
 *   - CSV, every cell, keeping the original value when a cell fails
 * - Pluggable inference engines (HTTP inference server, in-process mock)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Routing, model cache, executor and batch processors:
 *   - `translation::core`: The `TranslationService` façade
 *   - `translation::routing`: Route decisions and pivot execution
 *   - `translation::cache`: Model handle cache
 *   - `translation::batch`: Document walkers
 * - `providers`: Artifact store and inference engine collaborators:
 *   - `providers::local_store`: Filesystem artifact layout
 *   - `providers::remote`: HTTP inference server client
 *   - `providers::mock`: Deterministic engine for tests and dry runs
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, CatalogError, DocumentError, InferenceError, ModelLoadError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use translation::{DocumentFormat, LanguageCatalog, RouteDecision, TranslationResult, TranslationService};
