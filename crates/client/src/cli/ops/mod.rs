pub mod dir;
pub mod file;
pub mod init;
pub mod size;
pub mod watch;

pub use dir::Dir;
pub use file::File;
pub use init::Init;
pub use size::Size;
pub use watch::Watch;

use strata_client::{Directory, DirectoryListing, File as FileRecord};

pub(crate) fn format_file(file: &FileRecord) -> String {
    let classes = file
        .storage_classes
        .iter()
        .map(|class| class.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{} {} ({} bytes, {}) [{}]",
        file.id, file.name, file.size, file.mime_type, classes
    )
}

pub(crate) fn format_directory(directory: &Directory) -> String {
    format!(
        "{} {}/ [{}]",
        directory.id, directory.name, directory.storage_class
    )
}

pub(crate) fn format_listing(listing: &DirectoryListing) -> String {
    if listing.is_empty() {
        return "No items found".to_string();
    }
    listing
        .directories
        .iter()
        .map(format_directory)
        .chain(listing.files.iter().map(format_file))
        .collect::<Vec<_>>()
        .join("\n")
}
