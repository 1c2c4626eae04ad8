/// `./x`, `../x`, `.` and `..` are resolved against the requiring file's directory.
pub fn is_relative_specifier(name: &str) -> bool {
    name == "." || name == ".." || name.starts_with("./") || name.starts_with("../")
}
