mod localfs;
mod memory;

pub use localfs::LocalRepository;
pub use memory::MemoryRepository;
