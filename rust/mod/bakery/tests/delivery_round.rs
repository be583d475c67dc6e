use bakery::{Customer, Report, Session, SCHEMA_VERSION};
use bakery_core::ServiceConfig;
use bakery_kv::{Collection, RedbStore, Schema};

fn config_in(dir: &tempfile::TempDir) -> ServiceConfig {
    ServiceConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

fn ana() -> Customer {
    Customer {
        id: "1".into(),
        name: "Ana".into(),
        address: "Calle Mayor 3".into(),
        phone: "600123123".into(),
        balance: 10.5,
    }
}

#[tokio::test]
async fn full_round() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::open(&config_in(&dir)).await.unwrap();

    session.customers().save(ana()).await.unwrap();
    session.templates().save("1", "5").await.unwrap();

    let report = session.reports().generate().await.unwrap();
    let worksheet = report.worksheet().unwrap();
    assert_eq!(worksheet.lines().len(), 1);
    assert_eq!(worksheet.lines()[0].customer.name, "Ana");
    assert_eq!(worksheet.lines()[0].quantity, 5);
    assert_eq!(worksheet.total(), 5);

    session.customers().remove("1").await.unwrap();
    assert!(session.customers().list().await.unwrap().is_empty());
    assert_eq!(session.templates().get("1").await.unwrap().quantity, 0);
    assert_eq!(session.reports().generate().await.unwrap(), Report::NoCustomers);

    session.shutdown();
}

#[tokio::test]
async fn records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    {
        let session = Session::open(&config).await.unwrap();
        session.customers().save(ana()).await.unwrap();
        session.templates().save("1", "7").await.unwrap();
        session.shutdown();
    }

    let session = Session::open(&config).await.unwrap();
    assert_eq!(session.customers().list().await.unwrap(), vec![ana()]);
    assert_eq!(session.templates().get("1").await.unwrap().quantity, 7);
}

#[tokio::test]
async fn newer_database_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let newer = Schema::new(
        SCHEMA_VERSION + 1,
        vec![Collection::new("customers", "id"), Collection::new("templates", "customerId")],
    );
    drop(RedbStore::open(&config.resolve_db_path(), &newer).unwrap());

    let err = Session::open(&config).await.err().unwrap();
    assert!(err.is_fatal());
}
