//! Shell state and command dispatcher.

use anyhow::Result;
use mimapa_client::{ApiClient, NominatimGeocoder};
use mimapa_core::{identity::Session, marker::Marker, store::MediaStore as _};
use mimapa_session::{
  ActiveMarkerCache, Orchestrator, SaveOutcome, SearchOutcome,
};
use uuid::Uuid;

use crate::identity::ShellIdentity;

type ShellOrchestrator =
  Orchestrator<ApiClient, ApiClient, NominatimGeocoder, ShellIdentity>;

/// Top-level shell state.
///
/// The "screen" is implicit: `map`/`search` are the list views, `open`
/// selects a marker, and `show`/`place`/`image`/`delete` act on the
/// selection.
pub struct App {
  orch: ShellOrchestrator,

  /// Media uploads go through the same backend client.
  media: ApiClient,

  identity: ShellIdentity,

  /// The marker the user has opened, if any.
  selected: Option<Uuid>,
}

impl App {
  pub fn new(
    client: ApiClient,
    geocoder: NominatimGeocoder,
    identity: ShellIdentity,
  ) -> Self {
    let orch = Orchestrator::new(
      client.clone(),
      client.clone(),
      geocoder,
      identity.clone(),
      ActiveMarkerCache::new(),
    );
    Self {
      orch,
      media: client,
      identity,
      selected: None,
    }
  }

  /// Process one input line. Returns `false` to quit.
  pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
      return Ok(true);
    };
    let rest: Vec<&str> = parts.collect();

    match command {
      "help" => print_help(),
      "quit" | "exit" => return Ok(false),
      "login" => self.login(&rest),
      "logout" => self.logout(),
      "map" => self.show_own_map().await,
      "search" => self.search(&rest).await,
      "open" => self.open(&rest).await,
      "show" => self.show_selected().await,
      "new" => self.create(&rest).await,
      "place" => self.edit_place(&rest).await,
      "image" => self.attach_image(&rest).await,
      "delete" => self.delete_selected().await,
      "visits" => self.show_visits().await,
      other => println!("unknown command {other:?} — try `help`"),
    }
    Ok(true)
  }

  // ── Session ───────────────────────────────────────────────────────────────

  fn login(&self, args: &[&str]) {
    let [email, token] = args else {
      println!("usage: login <email> <token>");
      return;
    };
    self.identity.sign_in(Session {
      email: email.to_string(),
      token: token.to_string(),
    });
    println!("signed in as {email}");
  }

  fn logout(&mut self) {
    self.identity.sign_out();
    self.orch.clear_active_marker();
    self.selected = None;
    println!("signed out");
  }

  // ── List views ────────────────────────────────────────────────────────────

  async fn show_own_map(&mut self) {
    // Back at a list view: a held marker would be stale here.
    self.orch.clear_active_marker();
    self.selected = None;

    match self.orch.browse_own_map().await {
      Ok(markers) if markers.is_empty() => {
        println!("no markers yet — add one with `new <place>`");
      }
      Ok(markers) => print_marker_list(&markers),
      Err(e) => println!("error: {e}"),
    }
  }

  async fn search(&mut self, args: &[&str]) {
    self.orch.clear_active_marker();
    self.selected = None;

    let target = args.join(" ");
    match self.orch.search_map(&target).await {
      Ok(SearchOutcome::Loaded(markers)) => print_marker_list(&markers),
      Ok(SearchOutcome::Empty) => println!("no markers found for this user"),
      Err(e) => println!("error: {e}"),
    }
  }

  // ── Marker detail ─────────────────────────────────────────────────────────

  async fn open(&mut self, args: &[&str]) {
    let [raw_id] = args else {
      println!("usage: open <marker-id>");
      return;
    };
    let Ok(id) = Uuid::parse_str(raw_id) else {
      println!("not a marker id: {raw_id}");
      return;
    };

    match self.orch.view_marker(id).await {
      Ok(Some(marker)) => {
        self.selected = Some(id);
        self.print_marker(&marker);
      }
      Ok(None) => println!("no such marker"),
      Err(e) => println!("error: {e}"),
    }
  }

  async fn show_selected(&mut self) {
    let Some(id) = self.selected else {
      println!("open a marker first");
      return;
    };

    match self.orch.view_marker(id).await {
      Ok(Some(marker)) => self.print_marker(&marker),
      Ok(None) => {
        println!("the marker is gone");
        self.selected = None;
      }
      Err(e) => println!("error: {e}"),
    }
  }

  // ── Create / edit / delete ────────────────────────────────────────────────

  async fn create(&mut self, args: &[&str]) {
    if args.is_empty() {
      println!("usage: new <place>");
      return;
    }
    let place = args.join(" ");

    match self.orch.create_marker(&place, None).await {
      Ok(SaveOutcome::Saved(marker)) => {
        println!(
          "saved {} at ({}, {}) — open it with `open {}`",
          marker.place, marker.lat, marker.lon, marker.marker_id
        );
      }
      Ok(SaveOutcome::PlaceNotFound) => {
        println!("address not found — try a different place name");
      }
      Err(e) => println!("error: {e}"),
    }
  }

  async fn edit_place(&mut self, args: &[&str]) {
    let Some(id) = self.selected else {
      println!("open a marker first");
      return;
    };
    if args.is_empty() {
      println!("usage: place <new place name>");
      return;
    }
    let place = args.join(" ");

    match self.orch.edit_marker(id, Some(&place), None).await {
      Ok(SaveOutcome::Saved(marker)) => {
        println!("saved {} at ({}, {})", marker.place, marker.lat, marker.lon);
      }
      Ok(SaveOutcome::PlaceNotFound) => {
        println!("address not found — the marker is unchanged");
      }
      Err(e) => println!("error: {e}"),
    }
  }

  async fn attach_image(&mut self, args: &[&str]) {
    let Some(id) = self.selected else {
      println!("open a marker first");
      return;
    };
    let [path] = args else {
      println!("usage: image <file>");
      return;
    };

    let bytes = match std::fs::read(path) {
      Ok(b) => b,
      Err(e) => {
        println!("cannot read {path}: {e}");
        return;
      }
    };
    let filename = std::path::Path::new(path)
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "upload.bin".to_string());

    let url = match self.media.upload(filename, bytes).await {
      Ok(url) => url,
      Err(e) => {
        tracing::warn!(error = %e, "media upload failed");
        println!("error: could not upload the image");
        return;
      }
    };

    match self.orch.edit_marker(id, None, Some(url)).await {
      Ok(SaveOutcome::Saved(marker)) => {
        println!("image attached to {}", marker.place);
      }
      Ok(SaveOutcome::PlaceNotFound) => println!("address not found"),
      Err(e) => println!("error: {e}"),
    }
  }

  async fn delete_selected(&mut self) {
    let Some(id) = self.selected else {
      println!("open a marker first");
      return;
    };

    match self.orch.delete_marker(id).await {
      Ok(()) => {
        self.selected = None;
        println!("marker deleted");
      }
      Err(e) => println!("error: {e}"),
    }
  }

  // ── Visit log ─────────────────────────────────────────────────────────────

  async fn show_visits(&self) {
    match self.orch.visit_log().await {
      Ok(visits) if visits.is_empty() => {
        println!("nobody has visited your map yet");
      }
      Ok(visits) => {
        for v in &visits {
          let when = v.timestamp.with_timezone(&chrono::Local);
          println!("{}  {}", when.format("%Y-%m-%d %H:%M:%S"), v.visitor);
        }
      }
      Err(e) => println!("error: {e}"),
    }
  }

  // ── Rendering ─────────────────────────────────────────────────────────────

  fn print_marker(&self, marker: &Marker) {
    println!("{}  ({}, {})", marker.place, marker.lat, marker.lon);
    println!("  id:    {}", marker.marker_id);
    println!("  owner: {}", marker.owner);
    if let Some(url) = &marker.image_url {
      println!("  image: {url}");
    }
    if self.orch.can_modify(marker) {
      println!("  yours — `place <name>`, `image <file>`, `delete`");
    }
  }
}

fn print_marker_list(markers: &[Marker]) {
  for m in markers {
    println!("{}  {}  ({}, {})", m.marker_id, m.place, m.lat, m.lon);
  }
}

fn print_help() {
  println!("commands:");
  println!("  map                      your own map");
  println!("  search <email>           another user's map (logged as a visit)");
  println!("  open <marker-id>         open a marker");
  println!("  show                     the opened marker");
  println!("  new <place>              create a marker from a place name");
  println!("  place <name>             rename the opened marker's place");
  println!("  image <file>             attach an image to the opened marker");
  println!("  delete                   delete the opened marker");
  println!("  visits                   who has viewed your map");
  println!("  login <email> <token>    sign in");
  println!("  logout                   sign out");
  println!("  quit                     leave");
}
