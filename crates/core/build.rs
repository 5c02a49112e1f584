fn main() {
    // Use the vendored protoc binary so no system installation is required.
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("vendored protoc not found");
    std::env::set_var("PROTOC", protoc);

    let protos = [
        "proto/nearql/v1/base.proto",
        "proto/nearql/v1/search.proto",
        "proto/nearql/v1/batch.proto",
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    prost_build::compile_protos(&protos, &["proto/"])
        .expect("failed to compile proto/nearql/v1/*.proto");
}
