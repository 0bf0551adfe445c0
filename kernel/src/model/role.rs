use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[strum(to_string = "ADMIN")]
    Admin,
    #[default]
    #[strum(to_string = "USER")]
    User,
}
