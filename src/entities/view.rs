use serde::{Deserialize, Serialize};
use strum::Display;

use crate::entities::mark::MarkGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ViewGroup {
    Member,
    Job,
    Property,
    Article,
}

impl ViewGroup {
    pub fn table_name(&self) -> &'static str {
        self.as_mark_group().table_name()
    }

    pub fn counter_field(&self) -> &'static str {
        match self {
            ViewGroup::Member => "member_views",
            ViewGroup::Job => "job_views",
            ViewGroup::Property => "property_views",
            ViewGroup::Article => "article_views",
        }
    }

    fn as_mark_group(&self) -> MarkGroup {
        match self {
            ViewGroup::Member => MarkGroup::Member,
            ViewGroup::Job => MarkGroup::Job,
            ViewGroup::Property => MarkGroup::Property,
            ViewGroup::Article => MarkGroup::Article,
        }
    }
}
