fn main() {
    sqltest::cli::run();
}
