use json_debounce::DebouncedStore;
use std::time::Duration;

fn main() {
    let path = std::env::temp_dir().join("json_debounce_demo_basic.json");
    let db = DebouncedStore::open_with_delay(&path, Duration::from_millis(200));

    // set / get / has / delete
    db.set("apples", "3");
    db.set("bananas", 5); // non-strings are coerced
    println!("apples  = {:?}", db.get("apples"));
    println!("bananas = {:?}", db.get("bananas"));
    println!("has oranges? {}", db.has("oranges"));
    db.delete("apples");

    // snapshots
    println!("keys   = {:?}", db.keys());
    println!("values = {:?}", db.values());
    println!("len    = {}", db.len());

    // let the idle timer fire, then show the file
    std::thread::sleep(Duration::from_millis(500));
    println!("on disk: {}", std::fs::read_to_string(db.path()).unwrap());

    let _ = std::fs::remove_file(&path);
}
