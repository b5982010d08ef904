use recipe_crawl::{PageOutcome, RecipeCrawler};
use url::Url;

fn recipe_html(json_ld: &str, body: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            {body}
        </body>
        </html>
        "#
    )
}

fn crawler(max_pages: usize, max_depth: usize) -> RecipeCrawler {
    RecipeCrawler::builder()
        .max_pages(max_pages)
        .max_depth(max_depth)
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_crawl_follows_same_domain_recipe_links() {
    let mut server = mockito::Server::new_async().await;

    let seed_body = recipe_html(
        r#"{"@context": "https://schema.org", "@type": "Recipe", "name": "Chili",
            "recipeIngredient": ["beans", "beef"], "recipeInstructions": [{"text": "cook"}]}"#,
        r#"
        <a href="/recipe/cornbread/">Cornbread</a>
        <a href="/recipe/slaw/">Slaw</a>
        <a href="/recipe/missing/">Gone</a>
        <a href="/about/">About us</a>
        <a href="https://elsewhere.example.org/recipe/stolen/">Elsewhere</a>
        "#,
    );
    let seed = server
        .mock("GET", "/recipes/chili/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(seed_body)
        .expect(1)
        .create_async()
        .await;

    let cornbread = server
        .mock("GET", "/recipe/cornbread/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(recipe_html(
            r#"{"@graph": [{"@type": "WebPage"}, {"@type": "Recipe", "name": "Cornbread",
                "recipeIngredient": ["cornmeal", "buttermilk"], "image": "/img/cornbread.jpg"}]}"#,
            "",
        ))
        .expect(1)
        .create_async()
        .await;

    let slaw = server
        .mock("GET", "/recipe/slaw/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><body>
            <h2 class="tasty-recipes-title">Coleslaw</h2>
            <div class="tasty-recipes-ingredients"><ul><li>cabbage</li><li>mayo</li></ul></div>
            <div class="tasty-recipes-instructions"><ol><li>Shred</li><li>Toss</li></ol></div>
            </body></html>"#,
        )
        .expect(1)
        .create_async()
        .await;

    let about = server
        .mock("GET", "/about/")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let seed_url = Url::parse(&format!("{}/recipes/chili/", server.url())).unwrap();
    let report = crawler(5, 1).crawl(&seed_url).await;

    seed.assert_async().await;
    cornbread.assert_async().await;
    slaw.assert_async().await;
    about.assert_async().await;

    let titles: Vec<_> = report.recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Chili", "Cornbread", "Coleslaw"]);
    assert_eq!(report.pages_scraped, 4);

    let chili = &report.recipes[0];
    assert_eq!(chili.ingredients, vec!["beans", "beef"]);
    assert_eq!(chili.instructions, vec!["cook"]);
    assert_eq!(chili.url, seed_url.as_str());

    let cornbread = &report.recipes[1];
    assert_eq!(
        cornbread.image.as_deref(),
        Some(format!("{}/img/cornbread.jpg", server.url()).as_str())
    );

    assert_eq!(
        report.pages[2].outcome,
        PageOutcome::Extracted {
            strategy: Some("html_class"),
            recipes: 1
        }
    );
    assert_eq!(report.pages[3].outcome, PageOutcome::FetchFailed);
}

#[tokio::test]
async fn test_page_budget_with_many_links() {
    let mut server = mockito::Server::new_async().await;

    let anchors: String = (0..10)
        .map(|i| format!(r#"<a href="/recipe/dish-{i}/">Dish {i}</a>"#))
        .collect();
    let _seed = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(format!("<html><body>{anchors}</body></html>"))
        .create_async()
        .await;

    let mut linked = Vec::new();
    for i in 0..10 {
        let mock = server
            .mock("GET", format!("/recipe/dish-{i}/").as_str())
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(recipe_html(
                &format!(r#"{{"@type": "Recipe", "name": "Dish {i}", "recipeIngredient": ["item {i}"]}}"#),
                "",
            ))
            .expect(if i < 4 { 1 } else { 0 })
            .create_async()
            .await;
        linked.push(mock);
    }

    let seed_url = Url::parse(&format!("{}/", server.url())).unwrap();
    let report = crawler(5, 1).crawl(&seed_url).await;

    for mock in &linked {
        mock.assert_async().await;
    }
    assert_eq!(report.pages_scraped, 5);
    assert_eq!(report.recipes.len(), 4);
}

#[tokio::test]
async fn test_server_errors_are_absorbed() {
    let mut server = mockito::Server::new_async().await;

    let _seed = server
        .mock("GET", "/recipes/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(r#"<html><body><a href="/recipe/broken/">x</a><a href="/recipe/ok/">y</a></body></html>"#)
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/recipe/broken/")
        .with_status(500)
        .create_async()
        .await;
    let _ok = server
        .mock("GET", "/recipe/ok/")
        .with_status(200)
        .with_body(recipe_html(
            r#"{"@type": "Recipe", "name": "Survivor", "recipeInstructions": ["Stir"]}"#,
            "",
        ))
        .create_async()
        .await;

    let seed_url = Url::parse(&format!("{}/recipes/", server.url())).unwrap();
    let report = crawler(5, 1).crawl(&seed_url).await;

    assert_eq!(report.recipes.len(), 1);
    assert_eq!(report.recipes[0].title, "Survivor");
    assert_eq!(report.pages[1].outcome, PageOutcome::FetchFailed);
}
