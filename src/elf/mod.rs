//! ELF section relocation for ADSP images

mod types;
mod reader;
mod editor;

pub use editor::CommandRunner;
pub use editor::RelocateOptions;
pub use editor::RelocationReport;
pub use editor::ShiftCommand;
pub use editor::SystemRunner;
pub use editor::plan;
pub use editor::relocate;
pub use editor::relocate_sections;
pub use reader::read_sections;
pub use types::ALIAS_REGION_SIZE;
pub use types::AliasWindow;
pub use types::CACHED_ALIAS_OFFSET;
pub use types::SectionDescriptor;
pub use types::UNCACHED_REGION_BASE;
pub use types::select_uncached;
