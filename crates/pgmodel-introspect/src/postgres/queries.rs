use sqlx::PgPool;

use pgmodel_core::Result;

fn db_error(err: sqlx::Error) -> pgmodel_core::Error {
    pgmodel_core::Error::Db(err.to_string())
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawTable {
    pub schema: String,
    pub name: String,
}

pub async fn list_tables(
    pool: &PgPool,
    schemas: &[String],
    table_keys: &[String],
) -> Result<Vec<RawTable>> {
    sqlx::query_as::<_, RawTable>(
        r#"
        select
          n.nspname::text as schema,
          c.relname::text as name
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where c.relkind in ('r','p','v','m','f')
          and (
            n.nspname::text = any($1)
            or (n.nspname || '.' || c.relname) = any($2)
          )
        order by n.nspname, c.relname
        "#,
    )
    .bind(schemas.to_vec())
    .bind(table_keys.to_vec())
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawRelation {
    pub source_schema: String,
    pub source_table: String,
    pub source_columns: Vec<String>,
    pub target_schema: String,
    pub target_table: String,
    pub target_columns: Vec<String>,
}

/// Foreign keys on base tables. Constrained and referenced key columns are
/// unnested together so each source column pairs with the target column at
/// the same position.
pub async fn list_relations(pool: &PgPool, table_keys: &[String]) -> Result<Vec<RawRelation>> {
    sqlx::query_as::<_, RawRelation>(
        r#"
        select
          src_nsp.nspname::text as source_schema,
          src_rel.relname::text as source_table,
          array_agg(src_att.attname::text order by k.position) as source_columns,
          ref_nsp.nspname::text as target_schema,
          ref_rel.relname::text as target_table,
          array_agg(ref_att.attname::text order by k.position) as target_columns
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join pg_class ref_rel on ref_rel.oid = con.confrelid
        join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        join unnest(con.conkey, con.confkey)
          with ordinality as k(source_attnum, target_attnum, position) on true
        join pg_attribute src_att
          on src_att.attrelid = con.conrelid and src_att.attnum = k.source_attnum
        join pg_attribute ref_att
          on ref_att.attrelid = con.confrelid and ref_att.attnum = k.target_attnum
        where con.contype = 'f'
          and src_rel.relkind in ('r','p')
          and (src_nsp.nspname || '.' || src_rel.relname) = any($1)
        group by
          con.oid, con.conname,
          src_nsp.nspname, src_rel.relname,
          ref_nsp.nspname, ref_rel.relname
        order by src_nsp.nspname, src_rel.relname, con.conname
        "#,
    )
    .bind(table_keys.to_vec())
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub schema: String,
    pub table_name: String,
    pub name: String,
    pub nullable: bool,
    pub is_array: bool,
    pub dimensions: i32,
    pub source_type: String,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub max_length: i32,
    pub enum_values: Vec<String>,
}

/// Columns with array element types unwrapped, key flags and enum labels.
pub async fn list_columns(pool: &PgPool, table_keys: &[String]) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
          n.nspname::text as schema,
          c.relname::text as table_name,
          a.attname::text as name,
          (not a.attnotnull) as nullable,
          (t.typcategory = 'A') as is_array,
          (case
            when t.typcategory = 'A' then greatest(a.attndims::int4, 1)
            else 0
          end)::int4 as dimensions,
          coalesce(et.typname, t.typname)::text as source_type,
          pg_get_expr(ad.adbin, ad.adrelid) as default_value,
          exists (
            select 1 from pg_constraint pk
            where pk.conrelid = c.oid and pk.contype = 'p' and a.attnum = any(pk.conkey)
          ) as is_primary_key,
          exists (
            select 1 from pg_constraint fk
            where fk.conrelid = c.oid and fk.contype = 'f' and a.attnum = any(fk.conkey)
          ) as is_foreign_key,
          (case
            when coalesce(et.typname, t.typname) in ('varchar','bpchar') and a.atttypmod > 4
              then a.atttypmod - 4
            else 0
          end)::int4 as max_length,
          array(
            select e.enumlabel::text
            from pg_enum e
            where e.enumtypid = coalesce(et.oid, t.oid)
            order by e.enumsortorder
          ) as enum_values
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_type t on t.oid = a.atttypid
        left join pg_type et on et.oid = t.typelem and t.typcategory = 'A'
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        where a.attnum > 0
          and not a.attisdropped
          and (n.nspname || '.' || c.relname) = any($1)
        order by n.nspname, c.relname, a.attnum
        "#,
    )
    .bind(table_keys.to_vec())
    .fetch_all(pool)
    .await
    .map_err(db_error)
}
