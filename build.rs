fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/network.proto");

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile(&["proto/network.proto"], &["proto"])?;
    Ok(())
}
