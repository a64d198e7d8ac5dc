use fsh_cli::cli::fsh_main;

fn main() {
    fsh_main();
}
