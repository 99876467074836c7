use std::fs;
use std::io;
use std::sync::Arc;

use player::Item;

/// Read a JSON array of `{ "id", "source_uri", "title" }` objects
pub fn load(path: &str) -> io::Result<Vec<Arc<Item>>> {
  let contents = fs::read_to_string(path)?;
  parse(&contents)
}

pub fn parse(contents: &str) -> io::Result<Vec<Arc<Item>>> {
  let items: Vec<Item> = serde_json::from_str(contents)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
  Ok(items.into_iter().map(Arc::new).collect())
}

/// Playlist used when no file is given
pub fn demo() -> Vec<Arc<Item>> {
  [
    ("intro", "file:///demo/intro.ogg", "Intro"),
    ("morning", "file:///demo/morning.ogg", "Morning Drive"),
    ("static", "https://radio.example/static.mp3", "Static Bloom"),
    ("outro", "file:///demo/outro.ogg", "Outro"),
  ]
  .into_iter()
  .map(|(id, uri, title)| Arc::new(Item::new(id, uri, title)))
  .collect()
}
