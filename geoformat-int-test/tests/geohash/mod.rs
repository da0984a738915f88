mod geohash_test;
