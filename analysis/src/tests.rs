use super::*;

#[test]
fn spacepoint_records_from_csv() {
    let data = "x,y,z\n30.0,0.0,0.0\n80.0,0.5,-12.25\n";
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let records: Vec<SpacePointRecord> = reader.deserialize().map(Result::unwrap).collect();

    assert_eq!(
        records,
        [
            SpacePointRecord {
                x: 30.0,
                y: 0.0,
                z: 0.0
            },
            SpacePointRecord {
                x: 80.0,
                y: 0.5,
                z: -12.25
            },
        ]
    );
}

#[test]
fn seed_records_resolve_row_indices() {
    let spacepoints = [
        SpacePointRecord {
            x: 30.0,
            y: 0.0,
            z: 0.0,
        },
        SpacePointRecord {
            x: 80.0,
            y: 0.0,
            z: 0.0,
        },
        SpacePointRecord {
            x: 180.0,
            y: 0.0,
            z: 0.0,
        },
    ];
    let seed = Seed {
        bottom: &spacepoints[0],
        middle: &spacepoints[1],
        top: &spacepoints[2],
        z_origin: Length::new::<millimeter>(4.5),
        weight: -1.25,
    };

    let record = seed_record(&spacepoints, &seed);
    assert_eq!(
        record,
        SeedRecord {
            bottom: 0,
            middle: 1,
            top: 2,
            weight: -1.25,
            z_origin: 4.5,
        }
    );
}

#[test]
fn seed_records_to_csv() {
    let record = SeedRecord {
        bottom: 0,
        middle: 1,
        top: 2,
        weight: 200.0,
        z_origin: -16.0,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(record).unwrap();
    let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    assert_eq!(data, "bottom,middle,top,weight,z_origin\n0,1,2,200.0,-16.0\n");
}
