use nestjar_api::LocationKind;
use nestjar_runtime::Launcher;
use std::path::Path;
use tabled::{Table, Tabled};
use tracing::debug;

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn run(launcher: &Launcher, package: &Path) -> anyhow::Result<()> {
    let loader = launcher.build_loader(package)?;
    debug!("Listing {} classpath locations", loader.classpath().len());

    let rows: Vec<LocationRow> = loader
        .classpath()
        .iter()
        .enumerate()
        .map(|(index, location)| LocationRow {
            index,
            kind: location.kind.label(),
            address: location.address.to_string(),
            source: match &location.kind {
                LocationKind::NestedArchiveEntry(name) => name.clone(),
                LocationKind::SiblingArchiveFile(path) => path.display().to_string(),
                LocationKind::OuterArchive => package.display().to_string(),
                LocationKind::Bootstrap => String::new(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}
