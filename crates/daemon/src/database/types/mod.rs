mod dtimestamp;
mod duuid;

pub use dtimestamp::DTimestamp;
pub use duuid::DUuid;
