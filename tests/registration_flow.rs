use aqua_registration::config::AdminConfig;
use aqua_registration::{
    export_roster, AccountStatus, AuthService, LoginCredentials, RegisterData, Roster, Store,
    Swimmer, SwimmerForm,
};
use chrono::NaiveDate;

fn admin() -> AdminConfig {
    AdminConfig {
        email: "admin@club.fr".to_string(),
        name: "Administrator".to_string(),
        password: "pool-admin-42".to_string(),
    }
}

#[test]
fn test_full_flow_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("registrations.db");

    let coach_id = {
        let store = Store::open(&db_path).unwrap();
        let mut auth = AuthService::new(&store, &admin());

        let coach = auth
            .register(RegisterData {
                email: "coach@club.fr".to_string(),
                password: "freestyle".to_string(),
                name: "Coach Lina".to_string(),
                confirm_password: "freestyle".to_string(),
            })
            .unwrap();

        auth.login(LoginCredentials {
            email: "admin@club.fr".to_string(),
            password: "pool-admin-42".to_string(),
        })
        .unwrap();
        assert!(auth.approve_user(&coach.id));
        auth.logout();
        coach.id
    };

    // Reopen: users and decisions survived
    let store = Store::open(&db_path).unwrap();
    let mut auth = AuthService::new(&store, &admin());
    assert!(!auth.is_authenticated());
    let coach = auth
        .all_users()
        .into_iter()
        .find(|u| u.id == coach_id)
        .unwrap();
    assert_eq!(coach.status, AccountStatus::Approved);

    auth.login(LoginCredentials {
        email: "coach@club.fr".to_string(),
        password: "freestyle".to_string(),
    })
    .unwrap();
    assert!(auth.can_register_swimmers());

    let roster = Roster::new(&store);
    let swimmer = Swimmer::from_form(&SwimmerForm {
        name: "Maya".to_string(),
        birth_year: "2013".to_string(),
        competition: "Departmental Meet".to_string(),
        event: "200m Breaststroke".to_string(),
        entry_time: "3:02.50".to_string(),
    })
    .unwrap();
    roster.add(swimmer, &coach_id);

    let export_dir = dir.path().join("exports");
    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let path = export_roster(&export_dir, &roster.swimmers(), date).unwrap();
    assert!(path.ends_with("registrations_16-10-2026.csv"));

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 6);
    assert_eq!(&headers[0], "Name");

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "Maya");
    assert_eq!(&rows[0][3], "200m Breaststroke");
    assert_eq!(&rows[0][4], "3:02.50");
}
