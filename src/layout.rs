//! Viewport-width policy.
//!
//! Views never read a global window size: they receive a [`Viewport`] and ask
//! these functions what to render.

/// Widths above this are "wide".
pub const WIDE_BREAKPOINT: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn is_wide(&self) -> bool {
        self.width > WIDE_BREAKPOINT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1024 }
    }
}

/// Outcome of [`one_or_both`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrBoth<B, S> {
    Small(S),
    /// Small first, then big.
    Both { small: S, big: B },
}

/// Small alone on narrow screens, small followed by big on wide ones.
pub fn one_or_both<B, S>(big: B, small: S, viewport: Viewport) -> OneOrBoth<B, S> {
    if viewport.is_wide() {
        OneOrBoth::Both { small, big }
    } else {
        OneOrBoth::Small(small)
    }
}

/// Big on wide screens, small otherwise.
pub fn one_or_other<T>(big: T, small: T, viewport: Viewport) -> T {
    if viewport.is_wide() {
        big
    } else {
        small
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Horizontal,
    Vertical,
}

/// Glyphs a UI binding is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Instagram,
    Dev,
    Refresh,
    Remove,
    Edit,
    Login,
    Linux,
    Apple,
    Windows,
    Plus,
    Google,
    Search,
}

impl Icon {
    /// Provider glyph, generic for anything but Instagram.
    pub fn for_provider(name: &str) -> Icon {
        if name == "Instagram" {
            Icon::Instagram
        } else {
            Icon::Dev
        }
    }

    /// Operating-system glyph for a node's `OS` field.
    pub fn for_os(os: &str) -> Option<Icon> {
        match os {
            "linux" => Some(Icon::Linux),
            "darwin" => Some(Icon::Apple),
            "windows" => Some(Icon::Windows),
            _ => None,
        }
    }
}

/// Text plus icon on wide screens, icon only on narrow ones.
pub type Labelled = OneOrBoth<String, Icon>;

pub fn labelled(label: impl Into<String>, icon: Icon, viewport: Viewport) -> Labelled {
    one_or_both(label.into(), icon, viewport)
}
