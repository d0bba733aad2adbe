/*!
 * Translation routing and model lifecycle.
 *
 * Requests flow top-down through these submodules:
 *
 * - `batch`: document walkers (text lines, JSON leaves, CSV cells)
 * - `routing`: identity / direct / pivot / unsupported decisions
 * - `executor`: one direct hop against a cached model handle
 * - `cache`: lazily loaded model handles keyed by family and direction
 * - `profile`: fixed per-family generation parameters and pre/post-processing
 * - `catalog`: supported languages, hub language and direct pairs
 * - `core`: the `TranslationService` façade composing all of the above
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOutcome, BatchProcessor, BatchStatus, DocumentFormat};
pub use self::cache::{CacheStats, Direction, ModelCache, ModelHandle, ModelKey, ModelLoader};
pub use self::catalog::{DirectPair, LanguageCatalog, LanguageCode};
pub use self::core::{LanguageInfo, SupportedLanguages, SystemInfo, TranslationService};
pub use self::executor::{DirectTranslator, TranslationExecutor};
pub use self::routing::{RouteDecision, RoutingResolver, TranslationMethod, TranslationResult, TranslationStatus};

// Submodules
pub mod batch;
pub mod cache;
pub mod catalog;
pub mod core;
pub mod executor;
pub mod profile;
pub mod routing;
