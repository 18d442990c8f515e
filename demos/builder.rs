use json_debounce::DebouncedStore;
use std::time::Duration;

fn main() {
    // RUST_LOG=debug to see the store's diagnostics
    env_logger::init();

    let path = std::env::temp_dir().join("json_debounce_demo_builder.json");
    let db = DebouncedStore::builder()
        .path(&path)
        .flush_delay(Duration::from_millis(100))
        .pretty(true)
        .debug(true)
        .on_flush(|result| match result {
            Ok(()) => println!("flushed"),
            Err(e) => eprintln!("flush failed: {e}"),
        })
        .build();

    db.set("name", "json-debounce");
    db.set("version", "0.1.0");
    db.set("status", "awesome");

    // an explicit flush beats waiting out the idle window
    db.flush_now().unwrap();

    // the file on disk is now nicely indented
    let contents = std::fs::read_to_string(db.path()).unwrap();
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_file(&path);
}
