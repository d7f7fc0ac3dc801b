use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The parsed `Cargo.toml` of the crate a macro is expanding in.
///
/// Generated code must name `vc_class` the way the calling crate can see it:
///
/// 1. `::vc_class` when `vc_class` is a dependency.
/// 2. `::vc_serial::class` when only the `vc_serial` facade is, the `vc_`
///    prefix is dropped to find the re-exported module.
/// 3. The same two lookups in `dev-dependencies`.
/// 4. `::vc_class` otherwise.
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_class"));
/// ```
///
/// Inside `vc_class` itself the last rule applies, which is why its root
/// declares `extern crate self as vc_class;`.
///
/// Manifests are cached per path and reloaded when the file changes. Resolve
/// once per macro invocation and pass the path along.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_serial";
const MEMBER_PREFIX: &str = "vc_";
const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

impl Manifest {
    #[inline(never)]
    fn locate() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("`CARGO_MANIFEST_DIR` is not set, macros must be expanded by cargo");
        };
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(path.exists(), "no Cargo.toml at {}", path.display());
        path
    }

    #[inline(never)]
    fn modified(path: &Path) -> SystemTime {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or_else(|err| panic!("cannot stat {}: {err}", path.display()))
    }

    #[inline(never)]
    fn load(path: &Path, modified_time: SystemTime) -> Self {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
        let manifest = Document::parse(text.into_boxed_str())
            .unwrap_or_else(|err| panic!("invalid manifest {}: {err}", path.display()));
        Self {
            manifest,
            modified_time,
        }
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let mut text = String::new();
        for segment in segments {
            text.push_str("::");
            text.push_str(segment);
        }
        syn::parse_str(&text).unwrap_or_else(|err| panic!("`{text}` is not a path: {err}"))
    }

    fn find_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }

        let module = name.strip_prefix(MEMBER_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::path_of(&[FACADE_NAME, module]))
    }

    /// The path to the crate `name` as seen by the manifest's crate.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Self::find_in(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::path_of(&[name]))
    }

    /// Runs `func` with the manifest of the crate being compiled.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::locate();
        let modified_time = Self::modified(&path);

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(&path)
                && cached.modified_time == modified_time
            {
                return func(cached);
            }
        }

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}
