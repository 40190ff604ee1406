mod file_stage;

pub use file_stage::FileStage;
