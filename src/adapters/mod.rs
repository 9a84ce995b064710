// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod player_ffplay;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::LocalFsAdapter;
pub use player_ffplay::FFplayAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::init_tracing;
