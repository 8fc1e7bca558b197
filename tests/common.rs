//! Common test fixtures
//!
//! Upstream response fragments shared across test modules, shaped like the
//! real endpoints' bodies.

/// Episode-listing HTML fragment in the primary source's shape.
#[allow(dead_code)]
pub const EPISODE_FRAGMENT: &str = r#"
<div class="ss-list">
  <a href="/watch/one-piece-100?ep=2142" title="Romance Dawn" class="ssl-item ep-item" data-number="1" data-id="2142">
    <div class="ssli-order">1</div>
    <div class="ep-name e-dynamic-name" title="Romance Dawn">Romance Dawn</div>
  </a>
  <a href="/watch/one-piece-100?ep=2143" class="ssl-item ep-item ssl-item-filler" data-number="2" data-id="2143">
    <div class="ep-name e-dynamic-name" title="The Great Swordsman Appears!">The Great Swordsman Appears!</div>
  </a>
  <a href="/watch/one-piece-100?ep=2144" class="ssl-item ep-item" data-number="oops" data-id="2144">
    <div class="ep-name e-dynamic-name">Morgan vs. Luffy</div>
  </a>
</div>
"#;

/// Server-listing HTML fragment in the primary source's shape.
#[allow(dead_code)]
pub const SERVER_FRAGMENT: &str = r#"
<div class="ps_-block">
  <div class="server-item" data-type="sub" data-id="4"><a class="btn">HD-1</a></div>
  <div class="server-item" data-type="sub" data-id="1"><a class="btn">HD-2</a></div>
  <div class="server-item" data-type="dub" data-id="5"><a class="btn">HD-1</a></div>
  <div class="server-item" data-type="raw" data-id="9"><a class="btn">RAW-1</a></div>
</div>
"#;

/// Embed page exercising all four harvesting strategies.
#[allow(dead_code)]
pub const EMBED_PAGE: &str = r#"
<html>
  <body>
    <iframe src="https://player.example/e/abc123"></iframe>
    <iframe data-src="/lazy/player"></iframe>
    <video>
      <source src="/media/episode.mp4">
    </video>
    <a href="backup/episode.m3u8">Backup</a>
    <a href="./backup/episode.m3u8">Backup mirror</a>
    <a href="https://files.example/stream/42">Mirror</a>
    <a href="/about">About us</a>
    <script>
      var player = { file: "https://cdn.example/hls/master.m3u8?token=xyz" };
    </script>
  </body>
</html>
"#;
