use serde::Deserialize;

/// Fixed offsets and font sizes of the card layout.
///
/// ```text
/// +-----------+-+----------------------+
/// |           | | No. 25               |
/// |  sprite   | | Pikachu              |
/// |           | | Type 1/              |
/// |           | |    [icon]            |
/// +-----------+-+----------------------+
/// +------------------------------------+
/// | description                        |
/// +------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Sprite edge length; the sprite is scaled to a square
    pub sprite_size: u32,
    /// Bicubic sprite scaling instead of nearest neighbour
    pub smooth_sprite: bool,
    /// Horizontal gap between sprite and info block
    pub info_gap: u32,
    /// Offset of the id/name text inside the info block
    pub info_x: u32,
    pub info_y: u32,
    pub info_font_size: u32,
    pub info_min_font_size: u32,
    pub info_line_spacing: u32,
    /// Gap between the bottom of the id/name text and the type labels.
    /// The text starts `info_y` below the block top, so with the defaults
    /// the labels sit `text height + 60` below it.
    pub type_gap: u32,
    /// Horizontal icon indent and column spacing
    pub type_indent: u32,
    /// Gap between a type label and its icon
    pub icon_offset: u32,
    /// Description padding on every side
    pub description_padding: u32,
    pub description_font_size: u32,
    pub description_min_font_size: u32,
    pub description_line_spacing: u32,
    /// Thick divider width, centered one pixel past the sprite edge
    pub divider_width: u32,
    /// Distance from the divider center to the thin rule
    pub rule_offset: u32,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            sprite_size: 250,
            smooth_sprite: true,
            info_gap: 5,
            info_x: 10,
            info_y: 20,
            info_font_size: 24,
            info_min_font_size: 8,
            info_line_spacing: 4,
            type_gap: 40,
            type_indent: 20,
            icon_offset: 10,
            description_padding: 10,
            description_font_size: 24,
            description_min_font_size: 8,
            description_line_spacing: 8,
            divider_width: 5,
            rule_offset: 6,
        }
    }
}

impl LayoutPolicy {
    /// Width of the info block for a canvas `width` wide.
    pub fn info_width(&self, width: u32) -> u32 {
        width.saturating_sub(self.sprite_size + self.info_gap)
    }

    /// Smallest canvas this layout fits on.
    ///
    /// The info block must leave room for its inner offsets, the
    /// description block for its padding, and both dividers plus their thin
    /// rules must stay on the canvas.
    pub fn min_canvas_size(&self) -> (u32, u32) {
        let rule_extent = 1 + self.rule_offset + 1;
        let divider_extent = 1 + self.divider_width / 2 + 1;
        let edge = rule_extent.max(divider_extent);

        let info_extent = self.info_gap + 2 * self.info_x + 1;
        let description_extent = 2 * self.description_padding + 1;

        (
            self.sprite_size + info_extent.max(edge),
            self.sprite_size + description_extent.max(edge),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_canvas_size() {
        let layout = LayoutPolicy::default();
        // 250 + (5 + 20 + 1), 250 + (20 + 1)
        assert_eq!(layout.min_canvas_size(), (276, 271));
    }

    #[test]
    fn test_type_labels_sixty_below_text_top() {
        let layout = LayoutPolicy::default();
        // Labels at text height + 60 from the block top
        assert_eq!(layout.info_y + layout.type_gap, 60);
    }

    #[test]
    fn test_info_width() {
        let layout = LayoutPolicy::default();
        assert_eq!(layout.info_width(600), 345);
        assert_eq!(layout.info_width(100), 0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let layout: LayoutPolicy = serde_yaml::from_str("sprite_size: 96\n").unwrap();
        assert_eq!(layout.sprite_size, 96);
        assert_eq!(layout.description_line_spacing, 8);
    }
}
