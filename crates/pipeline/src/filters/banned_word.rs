//! Filter to hide videos whose text contains a banned word.
//!
//! One instance checks one field; the standard pipeline runs title,
//! description and channel name in that order so the reported reason names
//! the first field that matched.

use crate::decision::{FilterContext, FilterReason};
use crate::traits::Filter;
use catalog::Video;

/// Which text field of a video to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoField {
    Title,
    Description,
    Author,
}

impl VideoField {
    fn text(self, video: &Video) -> &str {
        match self {
            VideoField::Title => &video.title,
            VideoField::Description => &video.description,
            VideoField::Author => &video.author,
        }
    }

    fn reason(self) -> FilterReason {
        match self {
            VideoField::Title => FilterReason::TitleBannedWord,
            VideoField::Description => FilterReason::DescriptionBannedWord,
            VideoField::Author => FilterReason::ChannelNameBannedWord,
        }
    }
}

/// Hides videos where `field` contains a banned term.
pub struct BannedWordFilter {
    field: VideoField,
}

impl BannedWordFilter {
    pub fn new(field: VideoField) -> Self {
        Self { field }
    }
}

impl Filter for BannedWordFilter {
    fn name(&self) -> &str {
        match self.field {
            VideoField::Title => "BannedWordFilter(title)",
            VideoField::Description => "BannedWordFilter(description)",
            VideoField::Author => "BannedWordFilter(author)",
        }
    }

    fn check(&self, video: &Video, context: &FilterContext) -> Option<FilterReason> {
        if context.matcher.is_empty() {
            return None;
        }
        let text = self.field.text(video);
        if text.is_empty() {
            return None;
        }
        context
            .contains_banned_word(text)
            .then(|| self.field.reason())
    }
}
