// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

mod model {
    #[derive(Debug, Default, emux::Definition)]
    pub struct Step {
        #[emux(id = "step", handle = "c")]
        pub name: ::std::string::String
    }
}

#[derive(Debug, Default, emux::Definition)]
pub struct Plan {
    #[emux(id = "plan", handle = "c")]
    pub title: std::string::String,
    #[emux(handle = "c")]
    pub steps: std::vec::Vec<model::Step>
}

fn main() {
    use emux::Definition;
    assert_eq!(Plan::schema().len(), 2);
    assert_eq!(<model::Step as Definition>::TYPE_NAME, "Step");
}
