/// Build-script entry point: scans `src/`, writes `OUT_DIR/tabula.rs`, and
/// fails the build on any declaration error.
#[macro_export]
macro_rules! build {
    () => {{
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed=tabula.toml");

        //
        // GENERATED CODE
        //

        match $crate::Builder::from_env().and_then(|builder| builder.write()) {
            Ok(generated) => {
                for file in &generated.files {
                    println!("cargo:rerun-if-changed={}", file.display());
                }
                for warning in generated.diagnostics.iter() {
                    println!("cargo:warning={}", warning.to_string().replace('\n', " "));
                }
            }
            Err(err) => {
                for line in err.to_string().lines() {
                    println!("cargo:warning={line}");
                }
                panic!("tabula code generation failed: {err}");
            }
        }
    }};
}
