//! Integration tests for the import and catalog services against a
//! throwaway SQLite store.

use std::path::{Path, PathBuf};
use supplier_portal::config::SuppliersConfig;
use supplier_portal::db::Store;
use supplier_portal::domain::Supplier;
use supplier_portal::services::validation::ValidationError;
use supplier_portal::services::{
    CatalogService, DefaultImportService, ImportError, ImportService, SeaOrmCatalogService,
};

struct Fixture {
    root: PathBuf,
    store: Store,
    imports: DefaultImportService,
    catalog: SeaOrmCatalogService,
}

impl Fixture {
    async fn new() -> Self {
        let root = std::env::temp_dir().join(format!("portal-import-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();

        let store = Store::new(&format!("sqlite:{}", root.join("portal.db").display()))
            .await
            .unwrap();

        Self {
            imports: DefaultImportService::new(store.clone()),
            catalog: SeaOrmCatalogService::new(store.clone(), SuppliersConfig::default()),
            store,
            root,
        }
    }

    fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

fn images_dir(fixture: &Fixture) -> PathBuf {
    fixture.write("images/a.png", b"aaa");
    fixture.write("images/b.jpg", b"bbb");
    fixture.write("images/c.jpeg", b"ccc");
    fixture.write("images/readme.txt", b"skip me");
    fixture.root.join("images")
}

#[tokio::test]
async fn test_import_images_counts_only_supported_files() {
    let fixture = Fixture::new().await;
    let folder = images_dir(&fixture);

    let report = fixture.imports.import_images(&folder).await.unwrap();

    assert_eq!(report.imported, 3);
    assert!(report.failed.is_empty());
    assert_eq!(fixture.store.image_count().await.unwrap(), 3);
    assert!(
        fixture
            .catalog
            .find_image("readme.txt")
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        fixture.catalog.image_bytes("b.jpg").await.unwrap(),
        b"bbb".to_vec()
    );
}

#[tokio::test]
async fn test_reimport_replaces_previous_snapshot() {
    let fixture = Fixture::new().await;
    let folder = images_dir(&fixture);
    fixture.imports.import_images(&folder).await.unwrap();

    std::fs::remove_file(folder.join("a.png")).unwrap();
    let report = fixture.imports.import_images(&folder).await.unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.replaced, 3);
    assert_eq!(fixture.store.image_count().await.unwrap(), 2);
    assert!(fixture.catalog.find_image("a.png").await.unwrap().is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_image_is_reported_and_rest_imported() {
    let fixture = Fixture::new().await;
    let folder = images_dir(&fixture);
    std::os::unix::fs::symlink(folder.join("missing.png"), folder.join("x.png")).unwrap();

    let report = fixture.imports.import_images(&folder).await.unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].filename, "x.png");
    assert!(!report.failed[0].error.is_empty());
    assert_eq!(
        fixture.store.image_count().await.unwrap(),
        report.imported as u64
    );
    assert!(fixture.catalog.find_image("x.png").await.unwrap().is_none());
    assert!(fixture.catalog.find_image("c.jpeg").await.unwrap().is_some());
}

#[tokio::test]
async fn test_import_images_missing_folder() {
    let fixture = Fixture::new().await;

    let err = fixture
        .imports
        .import_images(&fixture.root.join("nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NotFound(_)));
}

#[tokio::test]
async fn test_clear_images_then_find_returns_none() {
    let fixture = Fixture::new().await;
    let folder = images_dir(&fixture);
    fixture.imports.import_images(&folder).await.unwrap();

    assert_eq!(fixture.imports.clear_images().await.unwrap(), 3);

    for name in ["a.png", "b.jpg", "c.jpeg"] {
        assert!(fixture.catalog.find_image(name).await.unwrap().is_none());
    }
    assert!(fixture.catalog.list_images().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inconsistent_csv_leaves_old_data() {
    let fixture = Fixture::new().await;

    let good = fixture.write(
        "good.csv",
        b"Nom du fichier;Cluster\na.png;1\nb.jpg;2\n",
    );
    fixture.imports.import_csv(&good).await.unwrap();

    let bad = fixture.write("bad.csv", b"Nom du fichier;Cluster\na.png;1;extra\nb.jpg;2\n");
    let err = fixture.imports.import_csv(&bad).await.unwrap_err();

    assert!(matches!(
        err,
        ImportError::Validation(ValidationError::InconsistentDelimiters)
    ));
    assert_eq!(err.to_string(), "Inconsistent number of delimiters");
    assert_eq!(fixture.store.csv_record_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_csv_import_and_lookup() {
    let fixture = Fixture::new().await;

    let file = fixture.write(
        "data.csv",
        "\u{feff}Nom du fichier;Cluster;Commentaire\n\
         a.png;1;\"x, y\"\n\
         b.jpg;2;\n\
         ;;\n\
         a.png;3;again\n"
            .as_bytes(),
    );

    let report = fixture.imports.import_csv(&file).await.unwrap();
    assert_eq!(report.imported, 3);
    assert!(report.warning.is_none());

    let rows = fixture
        .catalog
        .find_csv_by_field("Nom du fichier", "a.png")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].fields["Commentaire"], "x, y");

    let result = fixture
        .catalog
        .search(Supplier::MdElektronik, "b.jpg")
        .await
        .unwrap();
    assert!(result.image.is_none());
    assert_eq!(result.rows.len(), 1);
    assert!(result.rows[0].fields["Commentaire"].is_null());
}

#[tokio::test]
async fn test_csv_with_only_empty_rows_warns() {
    let fixture = Fixture::new().await;

    let old = fixture.write("old.csv", b"a;b\n1;2\n3;4\n");
    fixture.imports.import_csv(&old).await.unwrap();

    let empty = fixture.write("empty.csv", b"a;b\n;\n;\n");
    let report = fixture.imports.import_csv(&empty).await.unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(
        report.warning.as_deref(),
        Some("CSV file contained no valid data")
    );
    assert_eq!(fixture.store.csv_record_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_latin1_csv_is_imported() {
    let fixture = Fixture::new().await;

    let file = fixture.write("latin1.csv", b"Nom du fichier;Ville\nx.png;K\xf6ln\ny.png;S\xe8te\n");
    fixture.imports.import_csv(&file).await.unwrap();

    let rows = fixture
        .catalog
        .find_csv_by_field("Ville", "Köln")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fields["Nom du fichier"], "x.png");
}

#[tokio::test]
async fn test_missing_csv_is_a_validation_error() {
    let fixture = Fixture::new().await;

    let err = fixture
        .imports
        .import_csv(Path::new("/definitely/not/here.csv"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File does not exist");
}
