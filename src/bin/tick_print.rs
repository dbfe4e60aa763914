use std::env;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use ticklab::ticker::client::TickClient;

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:5555".to_string());
    let client = TickClient::new(path);

    //Start from the live edge of the feed rather than replaying the backlog
    let mut from = client.info()?.ticks;
    loop {
        let resp = client.history(from)?;
        for tick in &resp.ticks {
            println!("{}", serde_json::to_string(tick)?);
        }
        from = resp.next;
        thread::sleep(Duration::from_millis(100));
    }
}
