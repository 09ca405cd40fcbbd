mod constants;
pub use constants::{BLOCK_FILE_PREFIX, BLOCK_FILE_SUFFIX};

mod slot_id;
pub use slot_id::SlotId;

mod block_record;
pub use block_record::BlockRecord;

mod sync_mode;
pub use sync_mode::SyncMode;
