fn main() {
    tabula_build::build!();
}
