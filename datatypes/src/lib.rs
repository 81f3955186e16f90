pub mod error;
pub mod grid;
pub mod primitives;
pub mod util;

/// This macro resolves paths of files or folders in the `test_data` folder.
/// The `test_data` folder is located in the workspace root and has the same name as this macro.
/// To address data from the `test_data` folder you can use the macro like this:
///
/// Assuming a file "points.csv" in `test_data` with the path `test_data/points.csv` call the macro with `test_data!("points.csv")`.
///
/// # Panics
/// * if the path of the parent folder of `env!("CARGO_MANIFEST_DIR")` is unresolvable.
///
#[macro_export]
macro_rules! test_data {
    ($name:expr) => {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .canonicalize() // get a full path
            .expect("should be available during testing")
            .parent()
            .expect("should be available during testing")
            .join("test_data/")
            .join($name)
            .as_path()
    };
}
