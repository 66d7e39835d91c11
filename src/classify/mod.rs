pub mod classifier;
pub mod labeler;

pub use classifier::{Classification, IssueClassifier, Sentiment};
pub use labeler::{
    label_set, size_bucket, EventRepository, EventTarget, IssueEvent, LabelBot, PullRequestEvent,
    SizeBucket,
};
