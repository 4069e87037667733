use std::error::Error;

use chrono::{DateTime, Utc};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::types::RowValues;

/// Borrowed `RowValues` in the shape `tokio-postgres` expects for bind parameters.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let references = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Params { references }
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            // Narrow to the declared column width so `$1` against an int4 column binds.
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                _ => (*i).to_sql(ty, out),
            },
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => (*f).to_sql(ty, out),
            },
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => match *ty {
                Type::TIMESTAMPTZ => {
                    DateTime::<Utc>::from_naive_utc_and_offset(*dt, Utc).to_sql(ty, out)
                }
                _ => dt.to_sql(ty, out),
            },
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::Json(value) => value.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_narrows_to_column_width() {
        let mut buf = bytes::BytesMut::new();
        RowValues::Int(5408).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);

        let mut buf = bytes::BytesMut::new();
        assert!(RowValues::Int(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn null_binds_as_sql_null() {
        let mut buf = bytes::BytesMut::new();
        assert!(matches!(
            RowValues::Null.to_sql(&Type::TEXT, &mut buf),
            Ok(IsNull::Yes)
        ));
    }

    #[test]
    fn converted_params_keep_order() {
        let values = vec![RowValues::Int(1), RowValues::Text("md".into())];
        let params = Params::convert(&values);
        assert_eq!(params.as_refs().len(), 2);
    }

    #[test]
    fn rejects_unhandled_types() {
        assert!(!<RowValues as ToSql>::accepts(&Type::NUMERIC));
        assert!(<RowValues as ToSql>::accepts(&Type::INT4));
    }
}
