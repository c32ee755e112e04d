//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::PlanPage;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/plans" /> } />
                    <Route path=path!("/plans") view=PlanPage />
                </Routes>
            </main>
        </Router>
    }
}
