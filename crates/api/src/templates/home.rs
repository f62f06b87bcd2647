use maud::{html, Markup, DOCTYPE};

pub fn welcome_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Hawaii Climate Archive" }
            }
            body {
                h1 { "Welcome to the Hawaiian weather API!" }
                p { "Available routes:" }
                ul {
                    li {
                        a href="/api/v1.0/precipitation" { "/api/v1.0/precipitation" }
                    }
                    li {
                        a href="/api/v1.0/stations" { "/api/v1.0/stations" }
                    }
                    li {
                        a href="/api/v1.0/tobs" { "/api/v1.0/tobs" }
                    }
                    li { code { "/api/v1.0/{start}" } }
                    li { code { "/api/v1.0/{start}/{end}" } }
                }
                p {
                    "For the last two routes, start and end dates must be in "
                    code { "%Y-%m-%d" }
                    " format."
                }
                p {
                    a href="/docs" { "API Docs" }
                }
            }
        }
    }
}
