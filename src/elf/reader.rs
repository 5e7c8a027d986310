//! Section table parsing using elb

use std::fs::File;
use std::path::Path;

use elb::Elf;

use crate::error::RelocateError;

use super::types::SectionDescriptor;

/// Page size handed to elb
const PAGE_SIZE: u64 = 4096;

/// Read the name and address of every section, in section-table order
pub fn read_sections(path: impl AsRef<Path>) -> Result<Vec<SectionDescriptor>, RelocateError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    // Only the section headers are needed. The full check rejects LOAD
    // segments sharing a page, which firmware links produce.
    let elf = Elf::read_unchecked(&mut file, PAGE_SIZE)
        .map_err(|e| RelocateError::InvalidElf(format!("Failed to parse {}: {}", path.display(), e)))?;

    let names = elf
        .read_section_names(&mut file)
        .map_err(|e| RelocateError::InvalidElf(format!("Failed to read section names: {}", e)))?
        .ok_or_else(|| RelocateError::InvalidElf("missing section name table".to_string()))?;

    let mut sections = Vec::with_capacity(elf.sections.len());
    for section in elf.sections.iter() {
        let name = names
            .get_string(section.name_offset as usize)
            .ok_or_else(|| {
                RelocateError::InvalidElf(format!(
                    "section name offset {} out of bounds",
                    section.name_offset
                ))
            })?
            .to_string_lossy()
            .into_owned();
        log::debug!("section {:?} at {:#x}", name, section.virtual_address);
        sections.push(SectionDescriptor::new(name, section.virtual_address));
    }

    Ok(sections)
}
