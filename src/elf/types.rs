//! Types for ELF section information and the ADSP memory alias layout

/// Start of the uncached alias of ADSP SRAM.
///
/// ADSP devices map their RAM twice: once from 0x80000000 with the L1 cache
/// bypassed (coherent between cores, slow) and again from 0xa0000000 through
/// the cache.
pub const UNCACHED_REGION_BASE: u64 = 0x8000_0000;

/// Size of each alias window (512MB)
pub const ALIAS_REGION_SIZE: u64 = 0x2000_0000;

/// Distance from an uncached address to its cached alias
pub const CACHED_ALIAS_OFFSET: u64 = 0x2000_0000;

/// A section read from the ELF section header table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Section name from the section-name string table
    pub name: String,
    /// Virtual address (sh_addr)
    pub address: u64,
}

impl SectionDescriptor {
    pub fn new(name: impl Into<String>, address: u64) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// An uncached address window and the offset that moves it to its cached alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasWindow {
    pub base: u64,
    pub size: u64,
    pub cached_offset: u64,
}

impl AliasWindow {
    /// Layout of Intel ADSP parts
    pub const ADSP: AliasWindow = AliasWindow {
        base: UNCACHED_REGION_BASE,
        size: ALIAS_REGION_SIZE,
        cached_offset: CACHED_ALIAS_OFFSET,
    };

    /// Whether `address` lies in `[base, base + size)`
    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address - self.base < self.size
    }

    /// The cached alias of an uncached address
    pub fn cached_address(&self, address: u64) -> u64 {
        address.wrapping_add(self.cached_offset)
    }
}

impl Default for AliasWindow {
    fn default() -> Self {
        Self::ADSP
    }
}

/// Keep the sections inside `window`, in section-table order
pub fn select_uncached(sections: &[SectionDescriptor], window: &AliasWindow) -> Vec<SectionDescriptor> {
    sections
        .iter()
        .filter(|section| window.contains(section.address))
        .cloned()
        .collect()
}
