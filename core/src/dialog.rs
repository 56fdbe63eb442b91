//! Dialog chrome: the markup template and the viewport that shows it.

/// Placeholder replaced with the target href when the dialog is rendered.
pub const HREF_PLACEHOLDER: &str = "{{href}}";

const DEFAULT_TEMPLATE: &str = r#"<div class="modal-header"><h3>Create/Update</h3></div>
<form>
  <div class="modal-body">
    <label>Target URI</label><input name="url" class="url" type="text" value="{{href}}">
    <label>Method</label><input name="method" class="method" type="text" value="POST">
    <div id="jsoneditor"></div>
  </div>
  <div class="modal-footer"><button type="submit" class="btn btn-primary">Make Request</button></div>
</form>"#;

/// Markup for the request dialog, passed in explicitly rather than looked
/// up from page state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogTemplate {
    source: String,
}

impl DialogTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn render(&self, href: &str) -> String {
        self.source.replace(HREF_PLACEHOLDER, href)
    }
}

impl Default for DialogTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// The surface a form draws on: a modal dialog plus the addressable
/// location of the host.
pub trait Viewport {
    fn render(&mut self, markup: &str);
    fn show(&mut self);
    fn hide(&mut self);
    fn set_location(&mut self, location: &str);
}

/// A viewport with no display that records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct HeadlessViewport {
    pub markup: Option<String>,
    pub visible: bool,
    pub locations: Vec<String>,
}

impl HeadlessViewport {
    pub fn location(&self) -> Option<&str> {
        self.locations.last().map(String::as_str)
    }
}

impl Viewport for HeadlessViewport {
    fn render(&mut self, markup: &str) {
        self.markup = Some(markup.to_string());
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_location(&mut self, location: &str) {
        self.locations.push(location.to_string());
    }
}
