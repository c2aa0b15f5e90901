use nestjar_runtime::Launcher;
use std::path::Path;

pub fn run(launcher: &Launcher, package: &Path) -> anyhow::Result<()> {
    let loader = launcher.build_loader(package)?;
    let descriptor = launcher.describe(&loader)?;

    println!("Descriptor:  {}", launcher.config().descriptor);
    println!("Entry point: {}", descriptor.entry_point);

    if !descriptor.properties.is_empty() {
        println!("\nProperties:");
        for (key, value) in &descriptor.properties {
            println!("  {} = {}", key, value);
        }
    }

    if !descriptor.skipped.is_empty() {
        println!("\nIgnored lines:");
        for line in &descriptor.skipped {
            println!("  {}", line);
        }
    }
    Ok(())
}
