// templates/pages/home.rs

use crate::ingest::fields;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup, PreEscaped};

const UPLOAD_SCRIPT: &str = r#"
document.getElementById('upload-form').addEventListener('submit', function (ev) {
    ev.preventDefault();
    var input = document.getElementById('csv-file');
    var message = document.getElementById('upload-message');
    if (!input.files.length) { return; }
    message.textContent = 'Processing...';
    message.className = '';
    fetch('/upload', {
        method: 'POST',
        headers: { 'Content-Type': 'text/csv' },
        body: input.files[0]
    }).then(function (resp) {
        if (resp.ok) {
            window.location = '/dashboard';
        } else {
            return resp.text().then(function (text) {
                message.textContent = text;
                message.className = 'inline-message';
            });
        }
    }).catch(function () {
        message.textContent = 'Upload failed: could not reach the server.';
        message.className = 'inline-message';
    });
});
"#;

pub fn home_page(loaded: bool) -> Markup {
    desktop_layout(
        "Upload",
        html! {
            main class="container" {
                h1 { "Upload CRM Export" }
                @if loaded {
                    p {
                        "A portfolio is already loaded this session — uploading a new file replaces it. "
                        a href="/dashboard" { "Back to the dashboard" }
                    }
                }

                (card("Data Upload", html! {
                    p { "Upload the CSV file exported from your CRM system." }
                    form id="upload-form" style="display: flex; gap: 10px; align-items: center;" {
                        input type="file" id="csv-file" accept=".csv,text/csv" required;
                        button type="submit" style="padding: 8px 16px; font-size: 16px; cursor: pointer;" { "Upload" }
                    }
                    p id="upload-message" {}
                }))

                (card("Expected CSV Format", html! {
                    p { "The export should contain these key columns (exact, case-sensitive names):" }
                    ul style="columns: 2; font-size: 0.9em;" {
                        @for field in fields::KEY_FIELDS {
                            li { code { (field) } }
                        }
                    }
                    p {
                        "Price reductions are read from the trailing digit of the current "
                        "price: a price ending in 9 has no reductions, 8 one, 7 two, and so "
                        "on down to 0 for nine."
                    }
                }))

                script { (PreEscaped(UPLOAD_SCRIPT)) }
            }
        },
    )
}
