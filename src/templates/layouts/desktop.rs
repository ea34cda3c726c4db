use maud::{html, Markup, DOCTYPE};

const BASE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between;
         padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }
header nav ul { display: flex; gap: 1.25rem; list-style: none; margin: 0; padding: 0; }
header a { color: #1f2937; text-decoration: none; }
header a:hover { color: #2563eb; }
main.container { max-width: 1200px; margin: 0 auto; padding: 1rem 1.5rem 3rem; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem 1.25rem;
        margin-bottom: 1.5rem; background: #fff; }
.metric-row { display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.5rem; }
.metric { flex: 1 1 160px; border: 1px solid #e5e7eb; border-radius: 8px; padding: 0.75rem 1rem; }
.metric .label { font-size: 0.8rem; color: #6b7280; }
.metric .value { font-size: 1.4rem; font-weight: 600; }
table.data { width: 100%; border-collapse: collapse; margin-top: 0.5rem; font-size: 0.9em; }
table.data th { padding: 10px 8px; border-bottom: 2px solid #e5e7eb; text-align: left; }
table.data td { padding: 7px 8px; border-bottom: 1px solid #f3f4f6; }
.bar-track { background: #f3f4f6; border-radius: 4px; height: 14px; }
.bar-fill { background: #524ed2; border-radius: 4px; height: 14px; }
details { margin-bottom: 0.75rem; }
details summary { cursor: pointer; font-weight: 600; padding: 0.4rem 0; }
.inline-message { color: #dc2626; font-weight: 600; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(BASE_CSS)) }
            }
            body {
                header {
                    h3 { "Land Portfolio Analyzer" }
                    nav {
                        ul {
                            li { a href="/" { "Upload" } }
                            li { a href="/dashboard" { "Dashboard" } }
                            li { a href="/properties" { "Properties" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
