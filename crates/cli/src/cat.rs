use nestjar_api::TypeResolver;
use nestjar_runtime::Launcher;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub fn run(
    launcher: &Launcher,
    package: &Path,
    resource: &str,
    locate: bool,
) -> anyhow::Result<()> {
    let loader = launcher.build_loader(package)?;
    debug!("Resolving {} in {}", resource, package.display());

    if locate {
        let address = loader.find_resource(resource)?;
        println!("{}", address);
        if let Some(native) = loader.native_address(&address) {
            println!("{}", native);
        }
        return Ok(());
    }

    let bytes = loader.load_resource(resource)?;
    debug!("Writing {} bytes", bytes.len());
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}
