use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod job_entity;
pub mod property_entity;

/// Cities a job or property can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Location {
    Seoul,
    Busan,
    Incheon,
    Daegu,
    Gyeongju,
    Gwangju,
    Chonju,
    Daejon,
    Jeju,
}

pub const LOCATION_VALUES: &str =
    "['SEOUL', 'BUSAN', 'INCHEON', 'DAEGU', 'GYEONGJU', 'GWANGJU', 'CHONJU', 'DAEJON', 'JEJU']";
