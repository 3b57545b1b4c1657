pub mod cancel;
pub mod design;
pub mod error;
pub mod event;
pub mod presets;
pub mod provider_config;
pub mod traits;
pub mod types;

pub use cancel::CancelToken;
pub use design::{DesignDescriptor, LayoutPreference, LayoutType, RawDesign};
pub use error::{
    CardExportError, ChunkEnhancementError, DesignGenerationError, ForgeError, ParseError,
    ProviderError, WrapperGenerationError,
};
pub use event::{channel, EventKind, EventSink, PipelineEvent};
pub use provider_config::{BackendSettings, ProviderConfig, ProviderKind};
pub use traits::{FragmentStream, GenerationProvider, GenerationRequest};
pub use types::{Card, CardFailurePolicy, MarkdownBlock, TextChunk};
