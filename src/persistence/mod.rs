pub mod files;
pub mod session;

pub use files::{atomic_write, ensure_dir, init_local_dir, read_file, resolve_data_dir};
pub use session::{clear_session, load_session, save_session, SessionFile};
