//! Loading types and resources from archives nested in a package.

mod common;

use common::{write_package, zip_bytes};
use nestjar_api::{Classpath, LoadError, Location, TypeResolver};
use nestjar_core::protocol::ArchiveScheme;
use nestjar_core::{
    ClasspathAssembler, ClasspathResolver, DelegatingLoader, PackageSource, PrivilegedTable,
    ProtocolRegistry,
};
use std::sync::Arc;
use tempfile::TempDir;

struct Package {
    _dir: TempDir,
    loader: DelegatingLoader,
    host: Arc<ClasspathResolver>,
}

fn load_package(entries: &[(&str, &[u8])]) -> Package {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.jar");
    write_package(&path, entries);

    let registry = Arc::new(ProtocolRegistry::new());
    registry
        .register("application", Arc::new(ArchiveScheme::new(&path)))
        .unwrap();

    let host = Arc::new(ClasspathResolver::new(
        registry.clone(),
        Classpath::new(vec![Location::outer("application")]),
    ));
    let classpath = ClasspathAssembler::new("application", ".jar")
        .assemble(host.as_ref(), &PackageSource::detect(&path).unwrap())
        .unwrap();
    let privileged = PrivilegedTable::from_prefixes(&["nestjar.logging."], host.clone());

    Package {
        _dir: dir,
        loader: DelegatingLoader::new(privileged, ClasspathResolver::new(registry, classpath)),
        host,
    }
}

#[test]
fn test_types_resolve_from_nested_archives() {
    let util = zip_bytes(&[("com/example/Util.class", b"util")]);
    let app = zip_bytes(&[("com/example/App.class", b"app"), ("app.properties", b"a=1")]);
    let package = load_package(&[
        ("nestjar.boot", b"com.example.App"),
        ("lib/util.jar", &util),
        ("lib/app.jar", &app),
    ]);

    assert_eq!(package.loader.classpath().len(), 3);
    assert_eq!(&*package.loader.load_type("com.example.App").unwrap().bytes, b"app");
    assert_eq!(
        package.loader.load_type("com.example.Util").unwrap().origin,
        Location::nested("application", "lib/util.jar")
    );
    assert_eq!(
        package.loader.load_resource("/app.properties").unwrap(),
        b"a=1"
    );
    assert_eq!(
        package.loader.load_resource("nestjar.boot").unwrap(),
        b"com.example.App"
    );
}

#[test]
fn test_outer_archive_shadows_nested_copies() {
    let lib = zip_bytes(&[("com/example/Shared.class", b"nested")]);
    let package = load_package(&[
        ("com/example/Shared.class", b"outer"),
        ("lib/lib.jar", &lib),
    ]);

    assert_eq!(
        &*package.loader.load_type("com.example.Shared").unwrap().bytes,
        b"outer"
    );
}

#[test]
fn test_privileged_names_share_host_identity() {
    let lib = zip_bytes(&[("nestjar/logging/Sink.class", b"nested-copy")]);
    let package = load_package(&[
        ("nestjar/logging/Sink.class", b"host-copy"),
        ("lib/lib.jar", &lib),
    ]);

    let from_loader = package.loader.load_type("nestjar.logging.Sink").unwrap();
    let from_host = package.host.load_type("nestjar.logging.Sink").unwrap();
    assert!(Arc::ptr_eq(&from_loader, &from_host));
}

#[test]
fn test_missing_type() {
    let lib = zip_bytes(&[("x.txt", b"x")]);
    let package = load_package(&[("lib/lib.jar", &lib)]);

    assert!(matches!(
        package.loader.load_type("com.example.Missing"),
        Err(LoadError::TypeNotFound(_))
    ));
    assert!(matches!(
        package.loader.load_resource("missing.txt"),
        Err(LoadError::ResourceNotFound(_))
    ));
}

#[test]
fn test_native_addresses() {
    let lib = zip_bytes(&[("conf/lib.txt", b"lib")]);
    let package = load_package(&[("conf/app.txt", b"app"), ("lib/lib.jar", &lib)]);

    let outer = package.loader.find_resource("conf/app.txt").unwrap();
    assert_eq!(outer.to_string(), "application:/conf/app.txt");
    let native = package.loader.native_address(&outer).unwrap();
    assert_eq!(native.scheme(), "jar");
    assert!(native.as_str().ends_with("app.jar!/conf/app.txt"));

    let nested = package.loader.find_resource("conf/lib.txt").unwrap();
    assert_eq!(nested.to_string(), "jar:application:/lib/lib.jar!/conf/lib.txt");
    assert!(package.loader.native_address(&nested).is_none());
}

#[test]
fn test_concurrent_lookups() {
    let lib = zip_bytes(&[
        ("com/example/A.class", b"a"),
        ("com/example/B.class", b"b"),
    ]);
    let package = load_package(&[("lib/lib.jar", &lib)]);
    let loader = &package.loader;

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for name in ["com.example.A", "com.example.B"] {
                    loader.load_type(name).unwrap();
                }
                assert!(loader.load_type("com.example.C").is_err());
            });
        }
    });

    let a1 = loader.load_type("com.example.A").unwrap();
    let a2 = loader.load_type("com.example.A").unwrap();
    assert!(Arc::ptr_eq(&a1, &a2));
}
