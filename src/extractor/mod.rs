pub mod category_extractor;
pub mod progress;
pub mod result_renamer;

pub use category_extractor::{
    load_dataset, CategoryExtraction, CategoryExtractor, CategoryReport, CategorySet, Dataset,
    Record,
};
pub use progress::{BatchProgress, FileError};
pub use result_renamer::{
    Collision, CopyRecord, NamePattern, RenamePlan, RenameReport, ResultRenamer,
    VerifiedResultName,
};
